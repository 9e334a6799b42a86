//! Student-to-trip partitioning.
//!
//! Eligible students are taken in roster order and sliced into consecutive
//! chunks of at most the vehicle capacity. Geographic proximity is not
//! considered.

use std::collections::HashMap;

use crate::model::{PickupPoint, RouteProfile, Student, StudentGroup};

/// Students the profile's pool criteria admit, in roster order.
pub fn eligible_students<'a>(students: &'a [Student], profile: &RouteProfile) -> Vec<&'a Student> {
    students
        .iter()
        .filter(|student| profile.pool.admits(student))
        .collect()
}

/// Split the profile's eligible students into vehicle-sized groups.
///
/// A capacity of zero yields no groups; callers reject it beforehand.
pub fn partition(students: &[Student], profile: &RouteProfile, vehicle_capacity: usize) -> Vec<StudentGroup> {
    if vehicle_capacity == 0 {
        return Vec::new();
    }

    eligible_students(students, profile)
        .chunks(vehicle_capacity)
        .map(|chunk| group(chunk.iter().map(|student| (*student).clone()).collect()))
        .collect()
}

fn group(members: Vec<Student>) -> StudentGroup {
    let mut pickups: Vec<(PickupPoint, usize)> = Vec::new();
    let mut index: HashMap<PickupPoint, usize> = HashMap::new();

    for student in &members {
        let pickup = student.pickup_point();
        match index.get(&pickup) {
            Some(&slot) => pickups[slot].1 += 1,
            None => {
                index.insert(pickup.clone(), pickups.len());
                pickups.push((pickup, 1));
            }
        }
    }

    StudentGroup { members, pickups }
}
