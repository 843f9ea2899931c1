fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    #[cfg(feature = "native-gl")]
    generate_gl_bindings();
}

/// Fixed-function entry points need the compatibility profile.
#[cfg(feature = "native-gl")]
fn generate_gl_bindings() {
    use gl_generator::{Api, Fallbacks, Profile, Registry, StructGenerator};
    use std::env;
    use std::fs::File;
    use std::path::Path;

    let out_dir = env::var("OUT_DIR").expect("cargo sets OUT_DIR for build scripts");
    let mut file = File::create(Path::new(&out_dir).join("gl_bindings.rs"))
        .expect("failed to create gl_bindings.rs");

    Registry::new(Api::Gl, (2, 1), Profile::Compatibility, Fallbacks::All, [])
        .write_bindings(StructGenerator, &mut file)
        .expect("failed to write GL bindings");
}
