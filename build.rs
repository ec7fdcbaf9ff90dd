fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Only rerun if proto files change
    println!("cargo:rerun-if-changed=proto/decexec/dec_exec.proto");

    // Server stubs are generated for in-process test servers only; this
    // crate never serves DecExec itself.
    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos(&["proto/decexec/dec_exec.proto"], &["proto"])?;
    Ok(())
}
