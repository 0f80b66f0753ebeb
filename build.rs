fn main() {
    // I test `#[sqlx::test]` girano solo se c'è un database MySQL configurato
    println!("cargo:rustc-check-cfg=cfg(mysql_tests)");
    println!("cargo:rerun-if-env-changed=DATABASE_URL");
    if std::env::var_os("DATABASE_URL").is_some() {
        println!("cargo:rustc-cfg=mysql_tests");
    }
}
