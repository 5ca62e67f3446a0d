#[actix_web::main]
async fn main() -> std::io::Result<()> {
    plotserve::run().await
}
