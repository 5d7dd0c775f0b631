fn main() -> Result<(), Box<dyn std::error::Error>> {
    if std::env::var_os("PROTOC").is_none() {
        std::env::set_var("PROTOC", protoc_bin_vendored::protoc_bin_path()?);
    }

    tonic_build::configure()
        .build_server(false)
        .bytes(["."])
        .protoc_arg("--experimental_allow_proto3_optional")
        .compile_protos(&["proto/kv.proto", "proto/rpc.proto"], &["."])
        .unwrap_or_else(|e| panic!("protobuf compile error: {e}"));

    Ok(())
}
