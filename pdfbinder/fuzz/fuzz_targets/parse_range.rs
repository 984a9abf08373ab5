#![no_main]

use libfuzzer_sys::fuzz_target;
use pdfbinder::range::{self, RangeOutcome};

fuzz_target!(|data: &[u8]| {
    let Some((&count, expression)) = data.split_first() else {
        return;
    };
    let expression = String::from_utf8_lossy(expression);
    let page_count = usize::from(count);

    match range::parse(&expression, page_count) {
        Ok(RangeOutcome::WholeDocument) => {
            assert!(range::validate(&expression).is_empty());
        }
        Ok(RangeOutcome::Pages(selection)) => {
            assert!(!selection.is_empty());
            assert!(selection.iter().all(|page| (1..=page_count).contains(&page)));
        }
        Err(error) => {
            assert!(!error.token().is_empty());
        }
    }
});
