/// Unit test harness
///
/// Exercises the public domain API: habit validation, the streak engine and
/// the toggle transition.

mod basic_tests;
mod toggle_properties;
