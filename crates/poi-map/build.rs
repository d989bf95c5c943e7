fn main() {
    // Build metadata (version, branch, commit) logged at startup
    shadow_rs::ShadowBuilder::builder()
        .build()
        .expect("Failed to generate build metadata");
}
