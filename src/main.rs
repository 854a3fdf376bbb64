mod telemetry;

use subtrack_dispatcher::Application;
use subtrack_infra::setup_context;
use telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() {
    let subscriber = get_subscriber("subtrack".into(), "info".into());
    init_subscriber(subscriber);

    let context = setup_context().await;

    Application::new(context).start().await
}
