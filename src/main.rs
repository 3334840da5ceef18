#[tokio::main]
async fn main() {
    nightlife_backend::run().await;
}
