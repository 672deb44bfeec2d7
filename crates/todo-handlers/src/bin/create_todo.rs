#![recursion_limit = "256"]

use lambda_runtime::Error;
use todo_handlers::{lambda, Endpoint};

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda::run(Endpoint::Create).await
}
