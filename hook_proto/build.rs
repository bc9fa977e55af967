#[cfg(feature = "generate")]
fn main() {
    let src_dir = std::path::Path::new(&std::env::var("CARGO_MANIFEST_DIR").unwrap()).join("src");

    tonic_build::configure()
        .out_dir(&src_dir)
        .build_client(false)
        .build_server(true)
        .compile_protos(
            &[
                "proto/info.proto",
                "proto/api_v1alpha1.proto",
                "proto/api_v1alpha2.proto",
            ],
            &["proto"],
        )
        .expect("tonic build failed");
}

#[cfg(not(feature = "generate"))]
fn main() {}
