use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::{ChatKind, PolicyId, Report, ReportId};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PolicyRooms {
    pub admin_room: Option<ReportId>,
    pub announce_room: Option<ReportId>,
}

/// Per-policy index of the #admins and #announce rooms, derived from the
/// report collection.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RoomIndex {
    rooms: BTreeMap<PolicyId, PolicyRooms>,
}

impl RoomIndex {
    pub fn rooms_for(&self, policy_id: &PolicyId) -> Option<&PolicyRooms> {
        self.rooms.get(policy_id)
    }

    pub fn admin_room(&self, policy_id: &PolicyId) -> Option<&ReportId> {
        self.rooms_for(policy_id)
            .and_then(|rooms| rooms.admin_room.as_ref())
    }

    pub fn announce_room(&self, policy_id: &PolicyId) -> Option<&ReportId> {
        self.rooms_for(policy_id)
            .and_then(|rooms| rooms.announce_room.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PolicyId, &PolicyRooms)> {
        self.rooms.iter()
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

/// Scans reports for workspace rooms. Thread reports (anything with a parent)
/// never qualify, reports missing ids are skipped, and when several reports
/// claim the same room slot the one processed last wins.
pub fn build_room_index<'a>(reports: impl IntoIterator<Item = &'a Report>) -> RoomIndex {
    let mut rooms: BTreeMap<PolicyId, PolicyRooms> = BTreeMap::new();

    for report in reports {
        if report.report_id.as_str().is_empty() {
            continue;
        }
        let Some(policy_id) = report.policy_id.as_ref() else {
            continue;
        };
        if policy_id.as_str().is_empty() {
            continue;
        }
        if report.parent_report_id.is_some() {
            continue;
        }

        match report.chat_kind {
            Some(ChatKind::PolicyAdmins) => {
                rooms.entry(policy_id.clone()).or_default().admin_room =
                    Some(report.report_id.clone());
            }
            Some(ChatKind::PolicyAnnounce) => {
                rooms.entry(policy_id.clone()).or_default().announce_room =
                    Some(report.report_id.clone());
            }
            _ => {}
        }
    }

    RoomIndex { rooms }
}
