//! Fixed-answer clients for tests

use super::{AgeClient, ClientError, GenderClient, NationalityClient};
use async_trait::async_trait;
use std::time::Duration;

/// Canned outcome shared by the fixed clients
#[derive(Clone)]
struct Canned<T> {
    answer: Option<T>,
    fail: bool,
    delay: Duration,
}

impl<T: Clone> Canned<T> {
    async fn resolve(&self) -> Result<Option<T>, ClientError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail {
            return Err(ClientError::Network("mock source unavailable".to_string()));
        }
        Ok(self.answer.clone())
    }
}

macro_rules! fixed_client {
    ($name:ident, $value:ty, $input:ty, $trait:ident, $method:ident, $source:literal) => {
        #[derive(Clone)]
        pub struct $name(Canned<$value>);

        impl $name {
            pub fn answer(answer: Option<$input>) -> Self {
                Self(Canned {
                    answer: answer.map(Into::into),
                    fail: false,
                    delay: Duration::ZERO,
                })
            }

            pub fn failing() -> Self {
                Self(Canned {
                    answer: None,
                    fail: true,
                    delay: Duration::ZERO,
                })
            }

            pub fn delayed(mut self, delay: Duration) -> Self {
                self.0.delay = delay;
                self
            }
        }

        #[async_trait]
        impl $trait for $name {
            fn source(&self) -> &'static str {
                $source
            }

            async fn $method(&self, _name: &str) -> Result<Option<$value>, ClientError> {
                self.0.resolve().await
            }
        }
    };
}

fixed_client!(FixedAge, u32, u32, AgeClient, age_by_name, "mock-age");
fixed_client!(FixedGender, String, &str, GenderClient, gender_by_name, "mock-gender");
fixed_client!(
    FixedNationality,
    String,
    &str,
    NationalityClient,
    nationality_by_name,
    "mock-nationality"
);
