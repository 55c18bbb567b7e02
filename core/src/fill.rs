//! Resolve `Unknown` values before a model goes on the wire.
//!
//! The wire protocol has two absence states (omitted, explicit null) and no
//! "to be determined" state, so every `Unknown` left in a plan is turned into
//! `Null`, recursively through nested objects, lists and maps. Known and
//! null values are left as they are, which makes the pass idempotent.

use crate::model::{fill_object, Model};

pub fn fill_unknown<M: Model>(model: &mut M) {
    fill_object(model);
}
