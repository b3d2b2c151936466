//! Friend-based class recommendations
//!
//! Given a user, collects their accepted friends and computes, for every
//! unordered pair of those friends, the classes the two friends have in
//! common. The queried user is never part of a pair; the overlap is
//! friend-to-friend, inherited behavior that downstream clients depend on.
//! Classes are compared by the value equality of their simplified records,
//! not by row identity.

use crate::error::{ApiError, ApiResult};
use crate::models::{ClassSummary, Friendship};
use crate::repositories::{
    ClassRepository, FriendshipRepository, ScheduleRepository, UserRepository,
};

/// Recommendation engine over the friend graph
#[derive(Clone)]
pub struct RecommendationEngine {
    users: UserRepository,
    friendships: FriendshipRepository,
    schedules: ScheduleRepository,
    classes: ClassRepository,
}

impl RecommendationEngine {
    /// Create a new recommendation engine
    pub fn new(
        users: UserRepository,
        friendships: FriendshipRepository,
        schedules: ScheduleRepository,
        classes: ClassRepository,
    ) -> Self {
        Self {
            users,
            friendships,
            schedules,
            classes,
        }
    }

    /// Pairwise classes-in-common across the user's accepted friends
    ///
    /// Returns the overlap entries in pair order; a user with fewer than
    /// two accepted friends gets an empty mapping.
    pub async fn recommendations_for(
        &self,
        user_id: i64,
    ) -> ApiResult<Vec<(String, Vec<ClassSummary>)>> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(ApiError::NotFound("user"))?;

        let edges = self.friendships.accepted_for_user(user_id).await?;
        let friend_ids = peer_ids(user_id, &edges);

        let mut rosters: Vec<(i64, Vec<ClassSummary>)> = Vec::with_capacity(friend_ids.len());
        for friend_id in friend_ids {
            rosters.push((friend_id, self.class_roster(friend_id).await?));
        }

        Ok(pairwise_common_classes(&rosters))
    }

    /// The simplified class list on a friend's schedule
    async fn class_roster(&self, user_id: i64) -> ApiResult<Vec<ClassSummary>> {
        let Some(schedule) = self.schedules.find_by_user_id(user_id).await? else {
            return Ok(Vec::new());
        };

        let classes = self.classes.list_by_schedule(schedule.id).await?;
        Ok(classes.iter().map(|class| class.summary()).collect())
    }
}

/// The peer id of each edge relative to the queried user, deduplicated in
/// first-seen order
pub fn peer_ids(user_id: i64, edges: &[Friendship]) -> Vec<i64> {
    let mut ids = Vec::with_capacity(edges.len());
    for edge in edges {
        let peer = if edge.sender_id == user_id {
            edge.receiver_id
        } else {
            edge.sender_id
        };
        if !ids.contains(&peer) {
            ids.push(peer);
        }
    }
    ids
}

/// For every unordered pair of distinct friends {A, B}, the classes whose
/// simplified records appear in both rosters
///
/// Keys are the space-joined id pair ("A B") in first-seen order; common
/// classes keep A's list order.
pub fn pairwise_common_classes(
    rosters: &[(i64, Vec<ClassSummary>)],
) -> Vec<(String, Vec<ClassSummary>)> {
    let mut overlaps = Vec::new();

    for (i, (a_id, a_classes)) in rosters.iter().enumerate() {
        for (b_id, b_classes) in &rosters[i + 1..] {
            let common: Vec<ClassSummary> = a_classes
                .iter()
                .filter(|class| b_classes.contains(class))
                .cloned()
                .collect();

            overlaps.push((format!("{} {}", a_id, b_id), common));
        }
    }

    overlaps
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn edge(id: i64, sender_id: i64, receiver_id: i64, accepted: bool) -> Friendship {
        Friendship {
            id,
            sender_id,
            receiver_id,
            accepted,
            created_at: Utc::now(),
        }
    }

    fn summary(name: &str) -> ClassSummary {
        ClassSummary {
            name: name.to_string(),
            class_type: "LEC".to_string(),
            start_time: "10:10 AM".to_string(),
            end_time: "11:00 AM".to_string(),
            days: "MWF".to_string(),
        }
    }

    #[test]
    fn test_peer_ids_picks_other_endpoint() {
        let edges = vec![edge(1, 1, 2, true), edge(2, 3, 1, true)];
        assert_eq!(peer_ids(1, &edges), vec![2, 3]);
    }

    #[test]
    fn test_peer_ids_deduplicates_in_first_seen_order() {
        let edges = vec![edge(1, 1, 3, true), edge(2, 1, 2, true), edge(3, 3, 1, true)];
        assert_eq!(peer_ids(1, &edges), vec![3, 2]);
    }

    #[test]
    fn test_overlap_among_friends_of_a() {
        // B has {X, Y}, C has {Y, Z}; the pair {B, C} shares exactly Y.
        let rosters = vec![
            (2, vec![summary("X"), summary("Y")]),
            (3, vec![summary("Y"), summary("Z")]),
        ];

        let overlaps = pairwise_common_classes(&rosters);
        assert_eq!(overlaps.len(), 1);

        let (pair, common) = &overlaps[0];
        assert_eq!(pair, "2 3");
        assert_eq!(common, &vec![summary("Y")]);
    }

    #[test]
    fn test_pair_keys_follow_first_seen_order() {
        let rosters = vec![(7, vec![]), (4, vec![]), (9, vec![])];

        let overlaps = pairwise_common_classes(&rosters);
        let keys: Vec<&str> = overlaps
            .iter()
            .map(|(pair, _)| pair.as_str())
            .collect();

        assert_eq!(keys, vec!["7 4", "7 9", "4 9"]);
    }

    #[test]
    fn test_common_classes_match_by_value_not_identity() {
        // Identical display fields from distinct rows still overlap
        let rosters = vec![(2, vec![summary("Y")]), (3, vec![summary("Y")])];

        let overlaps = pairwise_common_classes(&rosters);
        assert_eq!(overlaps[0].1, vec![summary("Y")]);
    }

    #[test]
    fn test_disjoint_rosters_yield_empty_overlap() {
        let rosters = vec![(2, vec![summary("X")]), (3, vec![summary("Z")])];

        let overlaps = pairwise_common_classes(&rosters);
        assert_eq!(overlaps.len(), 1);
        assert!(overlaps[0].1.is_empty());
    }

    #[test]
    fn test_single_friend_yields_no_pairs() {
        let rosters = vec![(2, vec![summary("X")])];
        assert!(pairwise_common_classes(&rosters).is_empty());
    }
}
