use crate::core::types::OperationIndex;

/// Hands out gap-free operation indices within a transaction.
#[derive(Debug, Default)]
pub struct OperationCounter {
    next: OperationIndex,
}

impl OperationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(index: OperationIndex) -> Self {
        Self { next: index }
    }

    /// Claims the next index.
    pub fn claim(&mut self) -> OperationIndex {
        let index = self.next;
        self.next += 1;
        index
    }

    /// Index the next claim will return.
    pub fn peek(&self) -> OperationIndex {
        self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_claims_are_sequential() {
        let mut counter = OperationCounter::starting_at(2);
        assert_eq!(counter.peek(), 2);
        assert_eq!(counter.claim(), 2);
        assert_eq!(counter.claim(), 3);
        assert_eq!(counter.peek(), 4);
        assert_eq!(OperationCounter::new().claim(), 0);
    }
}
