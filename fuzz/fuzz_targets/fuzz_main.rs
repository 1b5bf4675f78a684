// SPDX-License-Identifier: AGPL-3.0-or-later
#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(doc) = vml_core::parse(text) {
        let _ = vml_core::to_html(&doc);
        let _ = vml_core::to_markdown(&doc);
        let _ = vml_core::outline(&doc);
    }
    let _ = vml_core::validate(text);
    let _ = vml_core::highlight(text);
    let _ = vml_core::format(text);
});
