// Library root
// -----------
// The binary (`main.rs`) is a thin shell over these modules, which keeps
// every stage testable without spawning the process.
//
// Module responsibilities:
// - `args`: command-line parsing and resolution into an `UploadConfig`.
// - `target`: partial-URL parsing and normalization against the default
//   upload host.
// - `api`: the authenticated POST and decoding of the response body.
// - `ui`: user-facing output (progress line, result, errors, usage).
// - `error`: the error type shared by all of the above.
pub mod api;
pub mod args;
pub mod error;
pub mod target;
pub mod ui;
