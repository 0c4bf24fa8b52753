//! Test Module
//!
//! Test suite for the storefront core.
//!
//! ## Test Categories
//! - `classifier_tests`: query routing rules and sanitization
//! - `analysis_tests`: contact capture and disambiguation in the analysis modal
//! - `dispatcher_tests`: the dispatcher actor against mock backends, in paused time
//! - `client_tests`: the reqwest backends against wiremock
//! - `scenario_tests`: end-to-end user journeys
