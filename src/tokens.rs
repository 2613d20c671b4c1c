/// Identifies one issued request for a logical state slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

/// Monotonic token source for one slot (location, search results, analysis).
/// A completion is applied only when its token is still the latest issued.
#[derive(Clone, Debug, Default)]
pub struct TokenSlot {
    latest: u64,
}

impl TokenSlot {
    pub fn issue(&mut self) -> RequestToken {
        self.latest += 1;
        RequestToken(self.latest)
    }

    pub fn is_latest(&self, token: RequestToken) -> bool {
        token.0 == self.latest
    }
}

#[test]
fn only_the_newest_token_is_current() {
    let mut slot = TokenSlot::default();
    let first = slot.issue();
    let second = slot.issue();

    assert!(first < second);
    assert!(!slot.is_latest(first));
    assert!(slot.is_latest(second));
}
