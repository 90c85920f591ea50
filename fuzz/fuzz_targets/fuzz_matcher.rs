#![no_main]

use libfuzzer_sys::fuzz_target;
use tagstream::{MarkerKind, MarkerMatcher, TagRegistry};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(registry) = TagRegistry::new([("think", "reasoning"), ("tool", "tool call")]) {
            let mut last_end = 0;
            for marker in MarkerMatcher::new(&registry).find_iter(s) {
                assert!(marker.span.start >= last_end);
                last_end = marker.span.end;

                let name = registry.name(marker.tag);
                let expected = match marker.kind {
                    MarkerKind::Open => format!("<{name}>"),
                    MarkerKind::Close => format!("</{name}>"),
                };
                assert_eq!(&s[marker.span], expected);
            }
        }
    }
});
