//! Mock navigator for isolating controllers in tests.

use mockall::mock;

use crate::navigation::{Location, Navigator};

mock! {
    pub Navigator {}

    impl Navigator for Navigator {
        fn location(&self) -> Location;
        fn push(&self, path: &str, query: &str);
    }
}
