//! Tests for `Reconciler`.

use super::{Action, DomainSpec, MANAGED_TTL, Operation, Reconciler};
use crate::resolver::ObservedAddresses;
use crate::store::test_fixtures::{Call, MockStore, Op};
use crate::store::{Record, RecordType};
use std::net::{Ipv4Addr, Ipv6Addr};

const ZONE: &str = "example.com";
const DOMAIN: &str = "a.example.com";

fn v4() -> Ipv4Addr {
    Ipv4Addr::new(1, 2, 3, 4)
}

fn v6() -> Ipv6Addr {
    "2001:db8::1".parse().unwrap()
}

fn a_record(name: &str, answer: &str, ttl: u32) -> Record {
    Record::new(ZONE, name, RecordType::A, ttl, vec![answer.to_string()])
}

fn aaaa_record(name: &str, answer: &str, ttl: u32) -> Record {
    Record::new(ZONE, name, RecordType::Aaaa, ttl, vec![answer.to_string()])
}

fn cname_record(name: &str) -> Record {
    Record::new(
        ZONE,
        name,
        RecordType::Cname,
        3600,
        vec!["elsewhere.example.net".to_string()],
    )
}

fn ipv4_only(name: &str) -> DomainSpec {
    DomainSpec::new(name).with_ipv6(false)
}

mod scenarios {
    use super::*;

    #[tokio::test]
    async fn missing_a_record_is_created() {
        let store = MockStore::new();
        let reconciler = Reconciler::new(ZONE);

        let report = reconciler
            .reconcile(&store, &[ipv4_only(DOMAIN)], &ObservedAddresses::v4(v4()))
            .await;

        let expected = Record::new(
            ZONE,
            DOMAIN,
            RecordType::A,
            60,
            vec!["1.2.3.4".to_string()],
        );
        assert_eq!(store.writes(), vec![Call::Create(expected)]);
        assert!(
            store
                .calls()
                .iter()
                .all(|call| !matches!(call, Call::Get(_, RecordType::Aaaa | RecordType::Cname)))
        );
        assert_eq!(report.count(Action::Created), 1);
        assert!(report.is_clean());
    }

    #[tokio::test]
    async fn matching_a_record_is_left_alone() {
        let store = MockStore::new().with_record(a_record(DOMAIN, "1.2.3.4", 60));
        let reconciler = Reconciler::new(ZONE);

        let report = reconciler
            .reconcile(&store, &[ipv4_only(DOMAIN)], &ObservedAddresses::v4(v4()))
            .await;

        assert!(store.writes().is_empty());
        assert_eq!(report.count(Action::Unchanged), 1);
        assert_eq!(report.writes(), 0);
    }
}

mod convergence {
    use super::*;

    #[tokio::test]
    async fn second_pass_issues_no_writes() {
        let store = MockStore::new().with_record(cname_record("b.example.com"));
        let domains = vec![
            DomainSpec::new(DOMAIN),
            DomainSpec::new("b.example.com")
                .with_ipv6(false)
                .with_replace(true),
        ];
        let observed = ObservedAddresses::new(v4(), v6());
        let reconciler = Reconciler::new(ZONE);

        let first = reconciler.reconcile(&store, &domains, &observed).await;
        store.clear_calls();
        let second = reconciler.reconcile(&store, &domains, &observed).await;

        assert_eq!(first.writes(), 4);
        assert_eq!(second.writes(), 0);
        assert!(
            store
                .writes()
                .iter()
                .all(|call| matches!(call, Call::Delete(..)))
        );
    }

    #[tokio::test]
    async fn created_records_carry_managed_ttl() {
        let store = MockStore::new();
        let reconciler = Reconciler::new(ZONE);

        reconciler
            .reconcile(
                &store,
                &[DomainSpec::new(DOMAIN)],
                &ObservedAddresses::new(v4(), v6()),
            )
            .await;

        let a = store.record(DOMAIN, RecordType::A).unwrap();
        let aaaa = store.record(DOMAIN, RecordType::Aaaa).unwrap();
        assert_eq!(a.ttl, MANAGED_TTL);
        assert_eq!(a.answers, vec!["1.2.3.4".to_string()]);
        assert_eq!(aaaa.ttl, MANAGED_TTL);
        assert_eq!(aaaa.answers, vec!["2001:db8::1".to_string()]);
    }

    #[tokio::test]
    async fn duplicate_domains_are_harmless() {
        let store = MockStore::new();
        let reconciler = Reconciler::new(ZONE);

        let report = reconciler
            .reconcile(
                &store,
                &[ipv4_only(DOMAIN), ipv4_only(DOMAIN)],
                &ObservedAddresses::v4(v4()),
            )
            .await;

        assert_eq!(report.count(Action::Created), 1);
        assert_eq!(report.count(Action::Unchanged), 1);
    }
}

mod drift {
    use super::*;

    #[tokio::test]
    async fn stale_address_is_updated_in_place() {
        let store = MockStore::new().with_record(a_record(DOMAIN, "9.9.9.9", 60).with_id("keep-me"));
        let reconciler = Reconciler::new(ZONE);

        let report = reconciler
            .reconcile(&store, &[ipv4_only(DOMAIN)], &ObservedAddresses::v4(v4()))
            .await;

        let writes = store.writes();
        assert_eq!(writes.len(), 1);
        let Call::Update(updated) = &writes[0] else {
            panic!("expected an update, got {writes:?}");
        };
        assert_eq!(updated.id.as_deref(), Some("keep-me"));
        assert_eq!(updated.answers, vec!["1.2.3.4".to_string()]);
        assert_eq!(updated.ttl, 60);
        assert_eq!(report.count(Action::Updated), 1);
    }

    #[tokio::test]
    async fn wrong_ttl_is_updated() {
        let store = MockStore::new().with_record(a_record(DOMAIN, "1.2.3.4", 3600).with_id("ttl"));
        let reconciler = Reconciler::new(ZONE);

        reconciler
            .reconcile(&store, &[ipv4_only(DOMAIN)], &ObservedAddresses::v4(v4()))
            .await;

        let stored = store.record(DOMAIN, RecordType::A).unwrap();
        assert_eq!(stored.ttl, 60);
        assert_eq!(stored.id.as_deref(), Some("ttl"));
        assert_eq!(store.writes().len(), 1);
    }

    #[tokio::test]
    async fn extra_answers_are_collapsed() {
        let mut record = a_record(DOMAIN, "1.2.3.4", 60);
        record.answers.push("5.6.7.8".to_string());
        let store = MockStore::new().with_record(record);
        let reconciler = Reconciler::new(ZONE);

        reconciler
            .reconcile(&store, &[ipv4_only(DOMAIN)], &ObservedAddresses::v4(v4()))
            .await;

        let stored = store.record(DOMAIN, RecordType::A).unwrap();
        assert_eq!(stored.answers, vec!["1.2.3.4".to_string()]);
    }

    #[tokio::test]
    async fn stale_aaaa_is_updated() {
        let store = MockStore::new().with_record(aaaa_record(DOMAIN, "2001:db8::99", 60));
        let reconciler = Reconciler::new(ZONE);
        let domain = DomainSpec::new(DOMAIN).with_ipv4(false);

        let report = reconciler
            .reconcile(&store, &[domain], &ObservedAddresses::v6(v6()))
            .await;

        assert_eq!(report.count(Action::Updated), 1);
        assert_eq!(
            store.record(DOMAIN, RecordType::Aaaa).unwrap().answers,
            vec!["2001:db8::1".to_string()]
        );
    }
}

mod conflicts {
    use super::*;

    #[tokio::test]
    async fn unwanted_a_record_is_deleted() {
        let store = MockStore::new().with_record(a_record(DOMAIN, "9.9.9.9", 60));
        let reconciler = Reconciler::new(ZONE);
        let domain = DomainSpec::new(DOMAIN)
            .with_ipv4(false)
            .with_replace(true);

        let report = reconciler
            .reconcile(&store, &[domain], &ObservedAddresses::new(v4(), v6()))
            .await;

        assert!(store.record(DOMAIN, RecordType::A).is_none());
        assert!(store.writes().contains(&Call::Delete(DOMAIN.to_string(), RecordType::A)));
        assert_eq!(report.count(Action::Deleted), 1);
    }

    #[tokio::test]
    async fn cname_is_always_deleted() {
        let store = MockStore::new().with_record(cname_record(DOMAIN));
        let reconciler = Reconciler::new(ZONE);
        let domain = DomainSpec::new(DOMAIN).with_replace(true);

        reconciler
            .reconcile(&store, &[domain], &ObservedAddresses::new(v4(), v6()))
            .await;

        assert!(store.record(DOMAIN, RecordType::Cname).is_none());
        assert!(store.writes().contains(&Call::Delete(DOMAIN.to_string(), RecordType::Cname)));
    }

    #[tokio::test]
    async fn conflicts_are_kept_without_replace() {
        let store = MockStore::new().with_record(cname_record(DOMAIN));
        let reconciler = Reconciler::new(ZONE);

        reconciler
            .reconcile(
                &store,
                &[ipv4_only(DOMAIN)],
                &ObservedAddresses::v4(v4()),
            )
            .await;

        assert!(store.record(DOMAIN, RecordType::Cname).is_some());
        assert!(
            !store
                .calls()
                .iter()
                .any(|call| matches!(call, Call::Delete(..)))
        );
    }

    #[tokio::test]
    async fn missing_conflict_counts_as_absent() {
        let store = MockStore::new();
        let reconciler = Reconciler::new(ZONE);
        let domain = ipv4_only(DOMAIN).with_replace(true);

        let report = reconciler
            .reconcile(&store, &[domain], &ObservedAddresses::v4(v4()))
            .await;

        assert_eq!(report.count(Action::Absent), 2);
        assert!(report.is_clean());
    }
}

mod isolation {
    use super::*;

    #[tokio::test]
    async fn read_failure_does_not_stop_other_sub_operations() {
        let store = MockStore::new()
            .with_record(cname_record(DOMAIN))
            .failing(Op::Get, DOMAIN, RecordType::A);
        let reconciler = Reconciler::new(ZONE);
        let domain = DomainSpec::new(DOMAIN).with_replace(true);

        let report = reconciler
            .reconcile(&store, &[domain], &ObservedAddresses::new(v4(), v6()))
            .await;

        assert_eq!(report.failures().len(), 1);
        let failure = &report.failures()[0];
        assert_eq!(failure.domain, DOMAIN);
        assert_eq!(failure.record_type, RecordType::A);
        assert_eq!(failure.error.operation, Operation::Read);
        assert!(store.record(DOMAIN, RecordType::Aaaa).is_some());
        assert!(store.record(DOMAIN, RecordType::Cname).is_none());
    }

    #[tokio::test]
    async fn write_failure_does_not_stop_later_domains() {
        let store = MockStore::new().failing(Op::Create, DOMAIN, RecordType::A);
        let reconciler = Reconciler::new(ZONE);
        let domains = [ipv4_only(DOMAIN), ipv4_only("b.example.com")];

        let report = reconciler
            .reconcile(&store, &domains, &ObservedAddresses::v4(v4()))
            .await;

        assert_eq!(report.failures().len(), 1);
        assert_eq!(report.failures()[0].error.operation, Operation::Create);
        assert!(store.record("b.example.com", RecordType::A).is_some());
    }

    #[tokio::test]
    async fn update_and_delete_failures_are_tagged() {
        let store = MockStore::new()
            .with_record(a_record(DOMAIN, "9.9.9.9", 60))
            .failing(Op::Update, DOMAIN, RecordType::A)
            .failing(Op::Delete, DOMAIN, RecordType::Cname);
        let reconciler = Reconciler::new(ZONE);
        let domain = ipv4_only(DOMAIN).with_replace(true);

        let report = reconciler
            .reconcile(&store, &[domain], &ObservedAddresses::v4(v4()))
            .await;

        let operations: Vec<_> = report
            .failures()
            .iter()
            .map(|f| (f.record_type, f.error.operation))
            .collect();
        assert_eq!(
            operations,
            vec![
                (RecordType::A, Operation::Update),
                (RecordType::Cname, Operation::Delete),
            ]
        );
        assert_eq!(report.count(Action::Absent), 1);
    }
}

mod missing_addresses {
    use super::*;

    #[tokio::test]
    async fn wanted_family_without_address_is_skipped() {
        let store = MockStore::new();
        let reconciler = Reconciler::new(ZONE);

        let report = reconciler
            .reconcile(
                &store,
                &[DomainSpec::new(DOMAIN)],
                &ObservedAddresses::v4(v4()),
            )
            .await;

        assert!(
            !store
                .calls()
                .iter()
                .any(|call| matches!(call, Call::Get(_, RecordType::Aaaa)))
        );
        assert_eq!(report.outcomes().len(), 1);
    }

    #[tokio::test]
    async fn no_addresses_means_no_calls() {
        let store = MockStore::new();
        let reconciler = Reconciler::new(ZONE);

        let report = reconciler
            .reconcile(
                &store,
                &[DomainSpec::new(DOMAIN)],
                &ObservedAddresses::default(),
            )
            .await;

        assert!(store.calls().is_empty());
        assert!(report.outcomes().is_empty());
    }
}

mod dry_run {
    use super::*;

    #[tokio::test]
    async fn reads_but_never_writes() {
        let store = MockStore::new()
            .with_record(aaaa_record(DOMAIN, "2001:db8::99", 60))
            .with_record(cname_record(DOMAIN));
        let reconciler = Reconciler::new(ZONE).with_dry_run(true);
        let domain = DomainSpec::new(DOMAIN).with_replace(true);

        let report = reconciler
            .reconcile(&store, &[domain], &ObservedAddresses::new(v4(), v6()))
            .await;

        assert!(store.writes().is_empty());
        assert!(report.is_dry_run());
        assert_eq!(report.count(Action::Created), 1);
        assert_eq!(report.count(Action::Updated), 1);
        assert_eq!(report.count(Action::Deleted), 1);
        assert!(store.record(DOMAIN, RecordType::Cname).is_some());
    }

    #[tokio::test]
    async fn read_failure_is_still_reported() {
        let store = MockStore::new().failing(Op::Get, DOMAIN, RecordType::Cname);
        let reconciler = Reconciler::new(ZONE).with_dry_run(true);
        let domain = ipv4_only(DOMAIN).with_replace(true);

        let report = reconciler
            .reconcile(&store, &[domain], &ObservedAddresses::v4(v4()))
            .await;

        assert_eq!(report.failures().len(), 1);
        assert_eq!(report.failures()[0].error.operation, Operation::Read);
    }
}
