//! End-to-end coverage for the warehouse insight server. Everything lives in
//! `tests/`, which binds a real listener and talks to it over HTTP.
