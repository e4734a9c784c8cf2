use std::path::PathBuf;

fn main() {
    // Generate the demo schema twice: one file per class, and all classes in
    // one file. Tests read the results from OUT_DIR.
    let out_dir = PathBuf::from(std::env::var("OUT_DIR").unwrap());
    let schema = "../demos/example-schema.json";

    pocogen_codegen::CodegenBuilder::new(schema)
        .output_dir(out_dir.join("multi").join("Models"))
        .namespace("AdventureWorks.Models")
        .generate()
        .expect("codegen failed");

    pocogen_codegen::CodegenBuilder::new(schema)
        .output_dir(out_dir.join("single").join("Models"))
        .namespace("AdventureWorks.Models")
        .single_file()
        .without_active_record()
        .generate()
        .expect("single-file codegen failed");

    println!("cargo:rerun-if-changed={schema}");
}
