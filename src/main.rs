//! Host-side helper: `cargo run` builds the overlay WASM package into
//! `static/pkg` and serves `static/` so both comparison pages can be opened
//! locally.

use std::process::{Command, Stdio};
use std::{env, thread, time::Duration};

const PORT: &str = "8000";

fn main() {
    // Only meaningful on non-wasm targets.
    if env::var("TARGET").unwrap_or_default() == "wasm32-unknown-unknown" {
        return;
    }

    println!("Building WASM pkg …");
    match Command::new("wasm-pack")
        .args([
            "build",
            "--release",
            "--target",
            "web",
            "--out-dir",
            "static/pkg",
        ])
        .status()
    {
        Ok(st) if st.success() => {},
        Ok(_) => {
            eprintln!("wasm-pack finished with errors. Ensure wasm-pack is installed (https://rustwasm.github.io/wasm-pack/).");
            std::process::exit(1);
        }
        Err(_) => {
            eprintln!("wasm-pack not found in PATH. Skipping wasm build; the pages may load a stale package.");
        }
    }

    // `static/pagepair/<id>` files stand in for the metadata endpoint.
    let server = Command::new("python3")
        .args(["-m", "http.server", PORT, "--directory", "static"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();
    if server.is_err() {
        eprintln!("python3 not found; serve static/ with any file server instead.");
        std::process::exit(1);
    }

    println!("aligned overlay:    http://127.0.0.1:{PORT}/aligned.html");
    println!("projective overlay: http://127.0.0.1:{PORT}/index.html");

    // Keep process alive
    loop {
        thread::sleep(Duration::from_secs(60));
    }
}
