//! Store identity for stock entities.

/// Something the entity store can key.
///
/// The id is fixed for the entity's lifetime; quantity and transaction log
/// change underneath it. Ids are ordered so listings and snapshots come out
/// in a stable order.
pub trait Entity {
    type Id: Clone + Ord + core::hash::Hash;

    fn id(&self) -> &Self::Id;

    /// Splits off an owned copy of the id, ready to be used as a map key.
    fn into_keyed(self) -> (Self::Id, Self)
    where
        Self: Sized,
    {
        (self.id().clone(), self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Bin {
        label: &'static str,
        units: u32,
    }

    impl Entity for Bin {
        type Id = &'static str;

        fn id(&self) -> &Self::Id {
            &self.label
        }
    }

    #[test]
    fn into_keyed_pairs_the_entity_with_its_id() {
        let (key, bin) = Bin { label: "a-1", units: 4 }.into_keyed();
        assert_eq!(key, "a-1");
        assert_eq!(bin.units, 4);
    }
}
