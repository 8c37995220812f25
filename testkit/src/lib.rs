//! Test drivers for the core3 engine.
//!
//! Provides a [`CapturingReporter`] with a scoped [`capture`] helper for
//! asserting on diagnostic reports, plus the canonical fixture types
//! (`User`, `Address`, `UserWithAddress`) and list builders shared by the
//! integration suites.
//!
//! Fixture types are registered once per process behind `LazyLock`, so
//! repeated use across parallel tests never triggers redefinition
//! warnings.

use std::sync::{Arc, LazyLock, Mutex, PoisonError};

use core3::{
    FieldSpec, Instance, Level, Report, Reporter, TypeRef, define, either, list, number, string,
    with_reporter,
};
use serde_json::json;

/// Reporter that records every diagnostic it receives.
#[derive(Default)]
pub struct CapturingReporter {
    reports: Mutex<Vec<Report>>,
}

impl CapturingReporter {
    /// Creates an empty capturing reporter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded reports.
    pub fn reports(&self) -> Vec<Report> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drains and returns the recorded reports.
    pub fn take(&self) -> Vec<Report> {
        let mut reports = self.reports.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *reports)
    }
}

impl Reporter for CapturingReporter {
    fn report(&self, level: Level, source: &str, message: &str) {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Report::new(level, source, message));
    }
}

/// Runs `f` with a fresh capturing reporter installed for this thread and
/// returns the closure result together with every diagnostic reported.
pub fn capture<R>(f: impl FnOnce() -> R) -> (R, Vec<Report>) {
    let reporter = Arc::new(CapturingReporter::new());
    let result = with_reporter(reporter.clone(), f);
    let reports = reporter.take();
    (result, reports)
}

static USER: LazyLock<TypeRef> = LazyLock::new(|| {
    define("User", || {
        FieldSpec::new()
            .field("name", string().with_default(""))
            .field("age", number().with_default(10))
    })
    .expect("User fixture type")
});

static ADDRESS: LazyLock<TypeRef> = LazyLock::new(|| {
    define("Address", || {
        FieldSpec::new()
            .field("address", string().with_default(""))
            .field("code", number().with_default(10))
    })
    .expect("Address fixture type")
});

static USER_WITH_ADDRESS: LazyLock<TypeRef> = LazyLock::new(|| {
    define("UserWithAddress", || {
        FieldSpec::new()
            .field("user", user_type())
            .field("address", address_type())
    })
    .expect("UserWithAddress fixture type")
});

/// The `User` fixture type.
pub fn user_type() -> TypeRef {
    USER.clone()
}

/// The `Address` fixture type.
pub fn address_type() -> TypeRef {
    ADDRESS.clone()
}

/// The `UserWithAddress` fixture type.
pub fn user_with_address_type() -> TypeRef {
    USER_WITH_ADDRESS.clone()
}

/// `List<string>` seeded with four names.
pub fn a_string_list() -> Instance {
    list()
        .of(string())
        .create(json!(["John", "Paul", "George", "Ringo"]))
        .expect("string list fixture")
}

/// `List<number>` seeded with `[1, 2]`.
pub fn a_number_list() -> Instance {
    list()
        .of(number())
        .create(json!([1, 2]))
        .expect("number list fixture")
}

/// `List<User>` seeded with a defaulted user and a named one.
pub fn a_user_list() -> Instance {
    list()
        .of(user_type())
        .create(json!([{}, { "name": "yossi" }]))
        .expect("user list fixture")
}

/// `List<User|Address>` seeded with untagged plain objects.
pub fn a_user_or_address_list() -> Instance {
    list()
        .of(either([user_type(), address_type()]))
        .create(json!([{}, { "name": "yossi" }]))
        .expect("user-or-address list fixture")
}
