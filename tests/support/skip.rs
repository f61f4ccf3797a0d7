/// Skip a test if the `openssl` binary is not installed.
#[macro_export]
macro_rules! skip_without_openssl {
    () => {
        if which::which("openssl").is_err() {
            eprintln!("SKIPPED: openssl not found on PATH");
            return;
        }
    };
}
