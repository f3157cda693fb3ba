//! Property-based tests for the mock provider

use proptest::prelude::*;
use std::time::Duration;
use trashdrop::client::mock_auth::MOCK_ROSTER;
use trashdrop::client::{AuthCapability, MockAuthProvider};
use trashdrop::shared::{AuthError, Credentials};

proptest! {
    #[test]
    fn test_unknown_credentials_are_rejected(
        email in "[a-z]{1,10}@[a-z]{1,8}\\.(com|app)",
        password in "[ -~]{0,16}",
    ) {
        prop_assume!(!MOCK_ROSTER
            .iter()
            .any(|account| account.email == email && account.password == password));

        let result = tokio_test::block_on(async {
            let mock = MockAuthProvider::with_latency(Duration::ZERO);
            let result = mock.sign_in_with_password(&Credentials::new(email, password)).await;
            (result, mock.get_session().await)
        });

        prop_assert!(matches!(result.0, Err(AuthError::InvalidCredentials)));
        prop_assert_eq!(result.1.unwrap(), None);
    }

    #[test]
    fn test_roster_passwords_are_case_sensitive(index in 0..MOCK_ROSTER.len()) {
        let account = &MOCK_ROSTER[index];
        let mock = MockAuthProvider::with_latency(Duration::ZERO);

        let wrong = Credentials::new(account.email, account.password.to_uppercase());
        prop_assert!(tokio_test::block_on(mock.sign_in_with_password(&wrong)).is_err());

        let right = Credentials::new(account.email, account.password);
        let data = tokio_test::block_on(mock.sign_in_with_password(&right)).unwrap();
        prop_assert_eq!(data.user.id.as_str(), account.id);
    }
}
