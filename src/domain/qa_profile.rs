use serde::{Deserialize, Serialize};
use std::fmt;

/// Testing category a profile can switch on or off.
///
/// Declaration order is the canonical order used everywhere categories are listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QaCategory {
    Functional,
    Ux,
    Ui,
    Negative,
    Api,
    Database,
    Performance,
    Security,
    Mobile,
    Accessibility,
}

impl QaCategory {
    pub const ALL: [QaCategory; 10] = [
        QaCategory::Functional,
        QaCategory::Ux,
        QaCategory::Ui,
        QaCategory::Negative,
        QaCategory::Api,
        QaCategory::Database,
        QaCategory::Performance,
        QaCategory::Security,
        QaCategory::Mobile,
        QaCategory::Accessibility,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QaCategory::Functional => "functional",
            QaCategory::Ux => "ux",
            QaCategory::Ui => "ui",
            QaCategory::Negative => "negative",
            QaCategory::Api => "api",
            QaCategory::Database => "database",
            QaCategory::Performance => "performance",
            QaCategory::Security => "security",
            QaCategory::Mobile => "mobile",
            QaCategory::Accessibility => "accessibility",
        }
    }
}

impl fmt::Display for QaCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category toggles. Every flag is required on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaCategories {
    pub functional: bool,
    pub ux: bool,
    pub ui: bool,
    pub negative: bool,
    pub api: bool,
    pub database: bool,
    pub performance: bool,
    pub security: bool,
    pub mobile: bool,
    pub accessibility: bool,
}

impl QaCategories {
    pub fn all(enabled: bool) -> Self {
        Self {
            functional: enabled,
            ux: enabled,
            ui: enabled,
            negative: enabled,
            api: enabled,
            database: enabled,
            performance: enabled,
            security: enabled,
            mobile: enabled,
            accessibility: enabled,
        }
    }

    pub fn is_enabled(&self, category: QaCategory) -> bool {
        match category {
            QaCategory::Functional => self.functional,
            QaCategory::Ux => self.ux,
            QaCategory::Ui => self.ui,
            QaCategory::Negative => self.negative,
            QaCategory::Api => self.api,
            QaCategory::Database => self.database,
            QaCategory::Performance => self.performance,
            QaCategory::Security => self.security,
            QaCategory::Mobile => self.mobile,
            QaCategory::Accessibility => self.accessibility,
        }
    }

    pub fn set(&mut self, category: QaCategory, enabled: bool) {
        let flag = match category {
            QaCategory::Functional => &mut self.functional,
            QaCategory::Ux => &mut self.ux,
            QaCategory::Ui => &mut self.ui,
            QaCategory::Negative => &mut self.negative,
            QaCategory::Api => &mut self.api,
            QaCategory::Database => &mut self.database,
            QaCategory::Performance => &mut self.performance,
            QaCategory::Security => &mut self.security,
            QaCategory::Mobile => &mut self.mobile,
            QaCategory::Accessibility => &mut self.accessibility,
        };
        *flag = enabled;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestCaseFormat {
    Gherkin,
    Steps,
    Table,
}

impl TestCaseFormat {
    pub const ALL: [TestCaseFormat; 3] = [
        TestCaseFormat::Gherkin,
        TestCaseFormat::Steps,
        TestCaseFormat::Table,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TestCaseFormat::Gherkin => "gherkin",
            TestCaseFormat::Steps => "steps",
            TestCaseFormat::Table => "table",
        }
    }
}

impl fmt::Display for TestCaseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OperationMode {
    #[default]
    Online,
    Offline,
}

/// User-controlled testing preferences. Immutable for the duration of one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QaProfile {
    pub qa_categories: QaCategories,
    pub test_case_format: TestCaseFormat,
    #[serde(default = "default_true")]
    pub auto_refresh: bool,
    #[serde(default = "default_true")]
    pub include_comments: bool,
    #[serde(default)]
    pub include_images: bool,
    #[serde(default)]
    pub operation_mode: OperationMode,
    #[serde(default = "default_true")]
    pub show_notifications: bool,
}

fn default_true() -> bool {
    true
}

impl QaProfile {
    pub fn new(qa_categories: QaCategories, test_case_format: TestCaseFormat) -> Self {
        Self {
            qa_categories,
            test_case_format,
            auto_refresh: true,
            include_comments: true,
            include_images: false,
            operation_mode: OperationMode::Online,
            show_notifications: true,
        }
    }
}

impl Default for QaProfile {
    fn default() -> Self {
        let mut categories = QaCategories::all(false);
        categories.functional = true;
        categories.ui = true;
        categories.ux = true;
        categories.negative = true;
        Self::new(categories, TestCaseFormat::Gherkin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_profile_round_trips_camel_case_wire_shape() {
        let profile: QaProfile = serde_json::from_value(json!({
            "qaCategories": {
                "functional": true, "ux": false, "ui": true, "negative": true, "api": false,
                "database": false, "performance": false, "security": true, "mobile": false,
                "accessibility": false
            },
            "testCaseFormat": "steps",
            "autoRefresh": false,
            "includeComments": true,
            "includeImages": true,
            "operationMode": "offline",
            "showNotifications": false
        }))
        .unwrap();

        assert_eq!(profile.test_case_format, TestCaseFormat::Steps);
        assert_eq!(profile.operation_mode, OperationMode::Offline);
        assert!(profile.qa_categories.security);
        assert!(!profile.auto_refresh);
    }

    #[test]
    fn test_missing_category_flag_is_rejected() {
        let result = serde_json::from_value::<QaCategories>(json!({
            "functional": true, "ux": false, "ui": true
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_set_and_read_each_category() {
        let mut categories = QaCategories::all(false);
        for category in QaCategory::ALL {
            assert!(!categories.is_enabled(category));
            categories.set(category, true);
            assert!(categories.is_enabled(category));
        }
        assert_eq!(categories, QaCategories::all(true));
    }
}
