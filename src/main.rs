#[cfg(not(target_family = "wasm"))]
fn main() {
    use clap::Parser;

    landing_page::desktop::run(landing_page::desktop::Args::parse());
}

#[cfg(target_family = "wasm")]
#[allow(dead_code)]
fn main() {
    unreachable!();
}
