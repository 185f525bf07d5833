// ── Aggregate inventory report ──
//
// Pure read-only aggregation over a loaded collection. Groups are
// ordered by descending size; equal sizes keep first-seen order.

use std::hash::Hash;

use indexmap::IndexMap;
use serde::Serialize;

use crate::model::{DeviceRecord, DeviceType, NetworkLayer, NetworkService};

/// How many member records each group carries as examples.
pub const EXAMPLES_PER_GROUP: usize = 3;

/// Records sharing one key value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group<K> {
    pub key: K,
    pub count: usize,
    /// The first [`EXAMPLES_PER_GROUP`] members in collection order.
    pub examples: Vec<DeviceRecord>,
    /// Members not shown in `examples`.
    pub overflow: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryReport {
    pub total: usize,
    pub by_type: Vec<Group<DeviceType>>,
    pub by_layer: Vec<Group<NetworkLayer>>,
    /// Service frequency: a device counts once per service it runs.
    pub by_service: Vec<Group<NetworkService>>,
    /// Every record, in stored order.
    pub devices: Vec<DeviceRecord>,
}

impl InventoryReport {
    pub fn build(records: Vec<DeviceRecord>) -> Self {
        let by_type = group(&records, |r| std::slice::from_ref(&r.device_type));
        let by_layer = group(&records, |r| std::slice::from_ref(&r.layer));
        let by_service = group(&records, |r| r.services.as_slice());
        Self {
            total: records.len(),
            by_type,
            by_layer,
            by_service,
            devices: records,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

fn group<'a, K>(
    records: &'a [DeviceRecord],
    keys: impl Fn(&'a DeviceRecord) -> &'a [K],
) -> Vec<Group<K>>
where
    K: Copy + Eq + Hash + 'a,
{
    let mut buckets: IndexMap<K, Vec<&DeviceRecord>> = IndexMap::new();
    for record in records {
        for key in keys(record) {
            buckets.entry(*key).or_default().push(record);
        }
    }

    let mut groups: Vec<Group<K>> = buckets
        .into_iter()
        .map(|(key, members)| Group {
            key,
            count: members.len(),
            examples: members
                .iter()
                .take(EXAMPLES_PER_GROUP)
                .map(|r| (*r).clone())
                .collect(),
            overflow: members.len().saturating_sub(EXAMPLES_PER_GROUP),
        })
        .collect();
    // Stable: ties stay in first-seen order.
    groups.sort_by(|a, b| b.count.cmp(&a.count));
    groups
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn device(
        name: &str,
        device_type: DeviceType,
        layer: NetworkLayer,
        services: &[NetworkService],
    ) -> DeviceRecord {
        DeviceRecord {
            name: name.into(),
            device_type,
            ip: "192.0.2.1".into(),
            location: "lab".into(),
            vlans: String::new(),
            services: services.to_vec(),
            layer,
            registered_at: Utc::now(),
        }
    }

    fn sample() -> Vec<DeviceRecord> {
        use DeviceType::{AccessPoint, Router, Switch};
        use NetworkLayer::{Access, Core, Distribution};
        use NetworkService::{Dhcp, Ospf, Ssh};
        vec![
            device("r1", Router, Core, &[Ospf, Ssh]),
            device("sw1", Switch, Distribution, &[Ssh]),
            device("ap1", AccessPoint, Access, &[]),
            device("sw2", Switch, Access, &[Ssh, Dhcp]),
            device("ap2", AccessPoint, Access, &[Ssh]),
            device("sw3", Switch, Access, &[]),
            device("sw4", Switch, Access, &[Ospf]),
        ]
    }

    #[test]
    fn group_counts_sum_to_total() {
        let report = InventoryReport::build(sample());
        assert_eq!(report.total, 7);
        assert_eq!(report.by_type.iter().map(|g| g.count).sum::<usize>(), 7);
        assert_eq!(report.by_layer.iter().map(|g| g.count).sum::<usize>(), 7);
        assert_eq!(report.devices.len(), 7);
    }

    #[test]
    fn groups_sort_by_count_then_first_seen() {
        let report = InventoryReport::build(sample());
        let types: Vec<_> = report.by_type.iter().map(|g| (g.key, g.count)).collect();
        assert_eq!(
            types,
            vec![
                (DeviceType::Switch, 4),
                // Router seen before AccessPoint but smaller.
                (DeviceType::AccessPoint, 2),
                (DeviceType::Router, 1),
            ]
        );
        let layers: Vec<_> = report.by_layer.iter().map(|g| (g.key, g.count)).collect();
        assert_eq!(
            layers,
            vec![
                (NetworkLayer::Access, 5),
                (NetworkLayer::Core, 1),
                (NetworkLayer::Distribution, 1),
            ]
        );
    }

    #[test]
    fn examples_cap_at_three_with_overflow() {
        let report = InventoryReport::build(sample());
        let switches = &report.by_type[0];
        let names: Vec<_> = switches.examples.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["sw1", "sw2", "sw3"]);
        assert_eq!(switches.overflow, 1);
        assert_eq!(report.by_type[2].overflow, 0);
    }

    #[test]
    fn service_frequency_table() {
        let report = InventoryReport::build(sample());
        let services: Vec<_> = report
            .by_service
            .iter()
            .map(|g| (g.key, g.count, g.overflow))
            .collect();
        assert_eq!(
            services,
            vec![
                (NetworkService::Ssh, 4, 1),
                (NetworkService::Ospf, 2, 0),
                (NetworkService::Dhcp, 1, 0),
            ]
        );
    }

    #[test]
    fn empty_collection_has_no_groups() {
        let report = InventoryReport::build(Vec::new());
        assert!(report.is_empty());
        assert!(report.by_type.is_empty());
        assert!(report.by_service.is_empty());
    }
}
