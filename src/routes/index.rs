pub const GREETING: &str = "Hello, World!";

pub async fn index() -> &'static str {
    GREETING
}
