use decoy::{Error, Verified};

#[test]
fn last_write_wins() {
    let mut answer = Verified::new();
    answer.assign(41).assign(42);

    assert!(answer.is_assigned());
    assert_eq!(*answer.get(), 42);
    assert_eq!(answer.read(), 42);
}

#[test]
fn holds_references_without_owning() {
    let config = vec!["verbose".to_string()];
    let mut borrowed: Verified<&Vec<String>> = Verified::default();
    borrowed.assign(&config);

    assert!(std::ptr::eq(*borrowed.get(), &config));
    assert_eq!(borrowed.read().len(), 1);
}

#[test]
fn try_get_does_not_fail() {
    let mut value = Verified::<u8>::new();
    assert_eq!(value.try_get(), Err(Error::Unassigned("value")));

    value.assign(1);
    assert_eq!(value.try_get(), Ok(&1));

    value.clear();
    assert_eq!(value.try_get(), Err(Error::Unassigned("value")));
}

#[test]
#[should_panic(expected = "value was read before it was assigned")]
fn unassigned_reads_fail() {
    let value = Verified::<String>::new();
    value.get();
}

#[test]
#[should_panic(expected = "retry budget was read before it was assigned")]
fn named_values_say_what_was_unassigned() {
    let budget = Verified::<u32>::named("retry budget");
    assert_eq!(budget.try_get(), Err(Error::Unassigned("retry budget")));
    budget.read();
}

#[test]
fn debug() {
    assert_eq!(format!("{:?}", Verified::<u8>::new()), "Verified(<unassigned>)");
    assert_eq!(format!("{:?}", Verified::from(3)), "Verified(3)");
}
