//! Basic lasterr example
//!
//! Walks the error slot through its states on the main thread and on a
//! worker thread.
//!
//! # Environment Variables
//!
//! - `LASTERR_FLUSH_EPRINT=1` - Flush debug output immediately
//! - `LASTERR_LOG_LEVEL=debug` - Set log level (off, error, warn, info, debug, trace)
//! - `LASTERR_TRACE_RECORDS=1` - Log every stored record at debug level

use lasterr::{set_error, CodeResult, ErrorClass, ErrorState, IoResultExt, ReporterConfig, ReturnCode};
use lasterr::{kdebug, kinfo};
use std::fs::File;
use std::thread;

// LASTERR_LOG_LEVEL=debug LASTERR_TRACE_RECORDS=1 cargo run -p lasterr-basic
fn main() {
    println!("=== lasterr Basic Example ===\n");

    let config = ReporterConfig::from_env();
    kdebug!("config: {:?}", config);
    lasterr::init(&config);

    // Empty -> populated
    if let Err(code) = parse_entry(b"\0\0") {
        show("parse_entry", code);
    }

    // Populated -> replaced
    if let Err(code) = open_packfile("/nonexistent/pack-0000.pack") {
        show("open_packfile", code);
    }

    // Cleanup errors do not clobber the real one
    let state = ErrorState::capture();
    set_error!(ErrorClass::Os, "failed to remove index.lock");
    state.restore();
    println!("after cleanup:  {:?}", lasterr::last());

    // Populated -> empty
    match lasterr::detach() {
        Some(rec) => println!("detached:       [{}] {}", rec.class(), rec.message()),
        None => println!("detached:       nothing"),
    }
    println!("slot now:       {:?}", lasterr::last());

    // Out of memory fallback
    lasterr::set_out_of_memory();
    println!("oom record:     {:?}", lasterr::last());
    lasterr::clear();

    // Every thread has its own slot
    let worker = thread::spawn(|| {
        set_error!(ErrorClass::Thread, "worker {:?} failed", thread::current().id());
        lasterr::last()
    });
    let from_worker = worker.join().unwrap_or(None);
    println!("worker record:  {:?}", from_worker);
    println!("main record:    {:?}", lasterr::last());

    // Sentinels are not reported
    for code in [ReturnCode::User, ReturnCode::Passthrough, ReturnCode::IterOver] {
        println!("{:<14}  {:?}", format!("{:?}:", code), lasterr::report(code));
    }

    kinfo!("example complete");
    println!("\n=== Example Complete ===");
}

fn parse_entry(raw: &[u8]) -> CodeResult<()> {
    if raw.first() == Some(&0) {
        set_error!(ErrorClass::Index, "invalid entry at offset {}", 0);
        return Err(ReturnCode::Error);
    }
    Ok(())
}

fn open_packfile(path: &str) -> CodeResult<File> {
    File::open(path).or_set_last_os(&format!("failed to open '{}'", path))
}

fn show(what: &str, code: ReturnCode) {
    match lasterr::report(code) {
        Some(text) => println!("{:<14}  {}", format!("{}:", what), text),
        None => println!("{:<14}  {}", format!("{}:", what), code),
    }
}
