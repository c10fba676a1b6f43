//! Repository tests against a real mongodb instance.
//! These need a docker daemon: `cargo test -p repositories -- --ignored`
use repositories::mongodb::{ConnectionDetails, DiscussionStore};
use rstest::fixture;
use testcontainers_modules::mongo::Mongo;
use testcontainers_modules::testcontainers::ContainerAsync;
use testcontainers_modules::testcontainers::runners::AsyncRunner;

mod comments;
mod topics;

struct TestRuntime {
    _container: ContainerAsync<Mongo>,
    store: DiscussionStore,
}

#[fixture]
async fn runtime() -> TestRuntime {
    let container = Mongo::default().start().await.unwrap();
    let host = container.get_host().await.unwrap();
    let port = container.get_host_port_ipv4(27017).await.unwrap();

    let store = DiscussionStore::init(
        ConnectionDetails::Url(format!("mongodb://{host}:{port}/")),
        "discussions_test",
        "discussions",
    )
    .await
    .unwrap();
    store.ensure_indexes().await.unwrap();

    TestRuntime {
        _container: container,
        store,
    }
}
