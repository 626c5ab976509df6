#![no_main]

use libfuzzer_sys::fuzz_target;
use tidyphp::{DoctrineMigrationsFixer, Fixer, TokenStream};
use tidyphp_syntax::TokensAnalyzer;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(mut stream) = TokenStream::from_code(s) else {
        return;
    };
    assert_eq!(stream.generate_code(), s);

    let _ = TokensAnalyzer::new(&stream).elements();

    // Run unconditionally so the rewrite passes see arbitrary shapes, not only candidates.
    DoctrineMigrationsFixer::default().apply_fix(&mut stream);
    let _ = stream.generate_code();
});
