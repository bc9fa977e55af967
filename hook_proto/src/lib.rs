//! Protocol bindings for the KubeVirt hook sidecar API.
//!
//! The `kubevirt.hooks.*.rs` sources are generated from `proto/` and
//! committed. Regenerate them with `cargo build -p hook_proto --features generate`.

/// Discovery service through which the launcher learns what a hook offers.
pub mod info {
    include!("kubevirt.hooks.info.rs");

    /// Hook point invoked right before the libvirt domain is defined.
    pub const ON_DEFINE_DOMAIN_HOOK_POINT: &str = "OnDefineDomain";
    /// Hook point invoked before the cloud-init ISO is generated.
    pub const PRE_CLOUD_INIT_ISO_HOOK_POINT: &str = "PreCloudInitIso";
}

pub mod v1alpha1 {
    include!("kubevirt.hooks.v1alpha1.rs");
}

pub mod v1alpha2 {
    include!("kubevirt.hooks.v1alpha2.rs");
}
