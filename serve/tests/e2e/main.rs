//! End-to-end tests: the API served on 127.0.0.1:0 and driven with reqwest.

mod common;
mod cors;
mod health;
mod research;
