#[actix_web::main]
async fn main() {
    if let Err(err) = qa_canvas_lib::run().await {
        eprintln!("qa-canvas: {}", err);
        std::process::exit(1);
    }
}
