use bevy_math::Vec3;

/// Keeps the `capacity` items with the smallest distance seen so far.
///
/// Entries are sorted so that the largest distance is the final element of
/// the stack, which is the one evicted by a closer item.
#[derive(Debug, Clone)]
pub struct NearestStack<T> {
    entries: Vec<(f32, T)>,
    capacity: usize,
}

impl<T> NearestStack<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, distance: f32, item: T) {
        if self.capacity == 0 {
            return;
        }

        if self.entries.len() == self.capacity {
            let max_distance = self.entries.last().map(|(d, _)| *d);
            // Not closer than the current maximum.
            if max_distance.is_some_and(|max| distance >= max) {
                return;
            }
            self.entries.pop();
        }

        // Equal distances keep insertion order.
        let index = self.entries.partition_point(|(d, _)| *d <= distance);
        self.entries.insert(index, (distance, item));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_items(self) -> impl Iterator<Item = T> {
        self.entries.into_iter().map(|(_, item)| item)
    }
}

/// The `max_count` candidates closest to `reference`, within `radius`.
///
/// Returned nearest first.
pub fn nearest_within<T>(
    candidates: impl IntoIterator<Item = (T, Vec3)>,
    reference: Vec3,
    radius: f32,
    max_count: usize,
) -> Vec<T> {
    let radius_squared = radius * radius;
    let mut stack = NearestStack::new(max_count);

    for (item, point) in candidates {
        let distance_squared = point.distance_squared(reference);
        if distance_squared > radius_squared {
            continue;
        }
        stack.push(distance_squared, item);
    }

    stack.into_items().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stack_keeps_nearest_sorted() {
        let mut stack = NearestStack::new(3);
        for (distance, item) in [(5.0, 'a'), (1.0, 'b'), (4.0, 'c'), (2.0, 'd'), (9.0, 'e')] {
            stack.push(distance, item);
        }

        assert_eq!(stack.len(), 3);
        assert_eq!(stack.into_items().collect::<Vec<_>>(), vec!['b', 'd', 'c']);
    }

    #[test]
    fn equal_distances_keep_first_seen() {
        let mut stack = NearestStack::new(2);
        stack.push(1.0, 'a');
        stack.push(1.0, 'b');
        stack.push(1.0, 'c');

        assert_eq!(stack.into_items().collect::<Vec<_>>(), vec!['a', 'b']);
    }

    #[test]
    fn zero_capacity_keeps_nothing() {
        let mut stack = NearestStack::new(0);
        stack.push(1.0, ());
        assert!(stack.is_empty());
    }

    #[test]
    fn nearest_within_radius() {
        let candidates = (0..10).map(|i| (i, Vec3::X * i as f32 * 0.1));
        let nearest = nearest_within(candidates, Vec3::X * 0.42, 0.25, 3);

        assert_eq!(nearest, vec![4, 5, 3]);
        assert!(nearest_within(Vec::<(u8, Vec3)>::new(), Vec3::ZERO, 1.0, 3).is_empty());
    }
}
