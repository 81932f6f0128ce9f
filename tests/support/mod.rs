#![allow(dead_code)]

pub mod wiring;
