//! # Mock Framework
//!
//! Utilities for testing a record's hooks without spinning up the actors it talks to.
//!
//! Two styles are offered:
//! - [`MockClient`] answers requests from a queue of canned responses.
//! - [`create_mock_client`] hands the raw request receiver to the test, which then
//!   pulls requests with [`expect_create`], [`expect_action`] and friends and
//!   answers them itself.

use crate::framework::{ActorEntity, FrameworkError, ResourceClient, ResourceRequest};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{mpsc, oneshot};

type Queue<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

/// An expected request and the response to send back.
enum Expectation<T: ActorEntity> {
    Get(Result<Option<T>, FrameworkError>),
    Create(Result<T::Id, FrameworkError>),
    CreateMany(Result<Vec<T::Id>, FrameworkError>),
    Query(Result<Vec<T>, FrameworkError>),
    Action(Result<T::ActionResult, FrameworkError>),
    ActionMany(Result<Vec<T::ActionResult>, FrameworkError>),
}

impl<T: ActorEntity> Expectation<T> {
    fn kind(&self) -> &'static str {
        match self {
            Expectation::Get(_) => "Get",
            Expectation::Create(_) => "Create",
            Expectation::CreateMany(_) => "CreateMany",
            Expectation::Query(_) => "Query",
            Expectation::Action(_) => "Action",
            Expectation::ActionMany(_) => "ActionMany",
        }
    }
}

/// A mock client answering requests in the order its expectations were queued.
///
/// # Example
/// ```ignore
/// let mock = MockClient::<Product>::new();
/// mock.expect_action().return_ok(ProductActionResult::CheckStock(3));
/// let products = ProductClient::new(mock.client());
/// // ... exercise code that calls `products` ...
/// mock.verify();
/// ```
///
/// Requests are also recorded by kind, so a test can assert that nothing else
/// was sent with [`MockClient::received`].
pub struct MockClient<T: ActorEntity> {
    client: ResourceClient<T>,
    expectations: Queue<T>,
    received: Arc<Mutex<Vec<&'static str>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ActorEntity> MockClient<T> {
    /// Creates a new mock client with no expectations.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let expectations: Queue<T> = Arc::new(Mutex::new(VecDeque::new()));
        let received = Arc::new(Mutex::new(Vec::new()));
        let queue = expectations.clone();
        let log = received.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let next = queue
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .pop_front();
                log.lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(request_kind(&request));

                match (request, next) {
                    (ResourceRequest::Get { respond_to, .. }, Some(Expectation::Get(response))) => {
                        let _ = respond_to.send(response);
                    }
                    (ResourceRequest::Create { respond_to, .. }, Some(Expectation::Create(response))) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::CreateMany { respond_to, .. },
                        Some(Expectation::CreateMany(response)),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (ResourceRequest::Query { respond_to, .. }, Some(Expectation::Query(response))) => {
                        let _ = respond_to.send(response);
                    }
                    (ResourceRequest::Action { respond_to, .. }, Some(Expectation::Action(response))) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::ActionMany { respond_to, .. },
                        Some(Expectation::ActionMany(response)),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (request, expected) => {
                        panic!(
                            "Unexpected {} request, expected {}",
                            request_kind(&request),
                            expected.as_ref().map_or("nothing", Expectation::kind)
                        );
                    }
                }
            }
        });

        Self {
            client: ResourceClient::new(sender),
            expectations,
            received,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    pub fn expect_get(&self) -> ExpectationBuilder<T, Option<T>> {
        self.builder(Expectation::Get)
    }

    pub fn expect_create(&self) -> ExpectationBuilder<T, T::Id> {
        self.builder(Expectation::Create)
    }

    pub fn expect_create_many(&self) -> ExpectationBuilder<T, Vec<T::Id>> {
        self.builder(Expectation::CreateMany)
    }

    pub fn expect_query(&self) -> ExpectationBuilder<T, Vec<T>> {
        self.builder(Expectation::Query)
    }

    pub fn expect_action(&self) -> ExpectationBuilder<T, T::ActionResult> {
        self.builder(Expectation::Action)
    }

    pub fn expect_actions(&self) -> ExpectationBuilder<T, Vec<T::ActionResult>> {
        self.builder(Expectation::ActionMany)
    }

    fn builder<R>(&self, wrap: fn(Result<R, FrameworkError>) -> Expectation<T>) -> ExpectationBuilder<T, R> {
        ExpectationBuilder {
            wrap,
            expectations: self.expectations.clone(),
        }
    }

    /// Kinds of the requests received so far, in arrival order.
    pub fn received(&self) -> Vec<&'static str> {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Panics unless every queued expectation was consumed.
    pub fn verify(&self) {
        let remaining = self
            .expectations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        if remaining != 0 {
            panic!("Not all expectations were met. {remaining} remaining");
        }
    }
}

impl<T: ActorEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Queues the response for one expected request.
pub struct ExpectationBuilder<T: ActorEntity, R> {
    wrap: fn(Result<R, FrameworkError>) -> Expectation<T>,
    expectations: Queue<T>,
}

impl<T: ActorEntity, R> ExpectationBuilder<T, R> {
    pub fn return_ok(self, value: R) {
        self.push(Ok(value));
    }

    pub fn return_err(self, error: FrameworkError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<R, FrameworkError>) {
        self.expectations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back((self.wrap)(response));
    }
}

fn request_kind<T: ActorEntity>(request: &ResourceRequest<T>) -> &'static str {
    match request {
        ResourceRequest::Create { .. } => "Create",
        ResourceRequest::CreateMany { .. } => "CreateMany",
        ResourceRequest::Get { .. } => "Get",
        ResourceRequest::Query { .. } => "Query",
        ResourceRequest::Update { .. } => "Update",
        ResourceRequest::Delete { .. } => "Delete",
        ResourceRequest::Action { .. } => "Action",
        ResourceRequest::ActionMany { .. } => "ActionMany",
    }
}

/// Creates a client whose requests land on a receiver owned by the test.
///
/// The test inspects each request as it arrives and decides the reply, which makes
/// it possible to check payloads and to simulate failures deterministically.
pub fn create_mock_client<T: ActorEntity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Pull the next request, returning it only if it is a Create.
pub async fn expect_create<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Create, oneshot::Sender<Result<T::Id, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Pull the next request, returning it only if it is a CreateMany.
pub async fn expect_create_many<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(Vec<T::Create>, oneshot::Sender<Result<Vec<T::Id>, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::CreateMany { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Pull the next request, returning it only if it is a Get.
pub async fn expect_get<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, oneshot::Sender<Result<Option<T>, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Pull the next request, returning it only if it is an Action.
pub async fn expect_action<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Action, oneshot::Sender<Result<T::ActionResult, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action {
            id,
            action,
            respond_to,
        }) => Some((id, action, respond_to)),
        _ => None,
    }
}

/// Pull the next request, returning it only if it is an ActionMany.
pub async fn expect_actions<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(
    Vec<(T::Id, T::Action)>,
    oneshot::Sender<Result<Vec<T::ActionResult>, FrameworkError>>,
)> {
    match receiver.recv().await {
        Some(ResourceRequest::ActionMany {
            actions,
            respond_to,
        }) => Some((actions, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Product, ProductCreate, ProductId, UserId};
    use crate::product_actor::{ProductAction, ProductActionResult};

    fn phone() -> ProductCreate {
        ProductCreate::new("Phone", 1000, 5, UserId::from("seller_1"), "My Store")
    }

    #[tokio::test]
    async fn test_mock_client_receiver_style() {
        let (client, mut receiver) = create_mock_client::<Product>(10);

        let create_task = tokio::spawn(async move { client.create(phone()).await });

        let (payload, responder) = expect_create(&mut receiver)
            .await
            .expect("Expected Create request");
        assert_eq!(payload.name, "Phone");
        responder.send(Ok(ProductId::from("prod_1"))).unwrap();

        let result = create_task.await.unwrap();
        assert_eq!(result.unwrap(), ProductId::from("prod_1"));
    }

    #[tokio::test]
    async fn test_mock_client_with_expectations() {
        let mock = MockClient::<Product>::new();
        mock.expect_create().return_ok(ProductId::from("prod_1"));
        mock.expect_action().return_ok(ProductActionResult::CheckStock(5));
        mock.expect_get().return_err(FrameworkError::ActorClosed);

        let client = mock.client();
        let id = client.create(phone()).await.unwrap();
        assert_eq!(id, ProductId::from("prod_1"));

        let stock = client.perform_action(id.clone(), ProductAction::CheckStock).await.unwrap();
        assert!(matches!(stock, ProductActionResult::CheckStock(5)));

        assert!(matches!(client.get(id).await, Err(FrameworkError::ActorClosed)));

        mock.verify();
        assert_eq!(mock.received(), vec!["Create", "Action", "Get"]);
    }
}
