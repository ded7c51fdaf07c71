//! Test harness for publish workflow integration tests.
//!
//! Everything external (wallet, identity service, SafeUpload) is mocked, so
//! the harness only sets up logging and hands out wired components.

use publisher_core::domains::auth::AuthSession;
use publisher_core::domains::posts::Publisher;
use publisher_core::kernel::test_dependencies::{MockIdentityService, MockWalletSigner};
use publisher_core::kernel::{PublisherDeps, TestDependencies};
use test_context::AsyncTestContext;

use super::{TEST_ADDRESS, TEST_HANDLE, TEST_PROFILE_ID};

/// Test harness shared by the publish workflow tests.
///
/// # Example using test-context
///
/// ```ignore
/// use test_context::test_context;
///
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &TestHarness) {
///     let (auth, publisher) = ctx.signed_in(ctx.deps()).await;
///     // ... test code
/// }
/// ```
pub struct TestHarness {
    pub address: String,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        // Respect RUST_LOG. try_init() because every test calls setup.
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        Self {
            address: TEST_ADDRESS.to_string(),
        }
    }

    async fn teardown(self) {
        // Mocks are dropped with their Arcs
    }
}

impl TestHarness {
    /// Default mocks with a single owned profile.
    pub fn deps(&self) -> TestDependencies {
        TestDependencies::new().mock_identity(self.identity())
    }

    /// Identity mock that owns the test profile.
    pub fn identity(&self) -> MockIdentityService {
        MockIdentityService::new().with_profile(TEST_PROFILE_ID, TEST_HANDLE)
    }

    pub fn signer(&self) -> MockWalletSigner {
        MockWalletSigner::new(self.address.clone())
    }

    /// Authenticated session plus a publisher over the same mocks.
    ///
    /// Authentication errors are ignored so tests can set up profile-less
    /// wallets; assert on the session state where it matters.
    pub async fn signed_in(&self, test_deps: TestDependencies) -> (AuthSession, Publisher) {
        let deps: PublisherDeps = test_deps.into_deps();
        let mut auth = AuthSession::new(deps.identity.clone());
        let _ = auth.authenticate(Some(&self.signer())).await;
        (auth, Publisher::new(&deps))
    }
}
