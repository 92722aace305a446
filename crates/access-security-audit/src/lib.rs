//! Intentionally empty: this crate only carries the tests in `tests/`.
