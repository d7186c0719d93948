use shadow_rs::ShadowBuilder;

fn main() {
    // Version and commit details for `--version`
    if let Err(e) = ShadowBuilder::builder().build() {
        println!("cargo:warning=failed to generate build metadata: {e}");
        std::process::exit(1);
    }
}
