mod common;
mod gate;
mod ledger;
mod service;
