fn main() {
    let rdkit_root =
        std::env::var("RDROOT").unwrap_or_else(|_| "/usr/local".to_owned());

    println!(
        "cargo:rustc-env=LD_LIBRARY_PATH={rdkit_root}/lib:{rdkit_root}/build/lib"
    );
}
