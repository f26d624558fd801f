//! Shooter containers that sit off the rail: the deck and the waiting area.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use pixel_rail_core::{Color, Shooter};

/// Independent FIFO queues of shooters that have not yet been launched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Deck {
    queues: Vec<VecDeque<Shooter>>,
}

impl Deck {
    /// Creates a deck with `queue_count` empty queues.
    #[must_use]
    pub fn new(queue_count: usize) -> Self {
        Self {
            queues: vec![VecDeque::new(); queue_count],
        }
    }

    /// Deals `shooters` round-robin into `queue_count` queues.
    ///
    /// A zero queue count is raised to one so that no shooter is dropped.
    #[must_use]
    pub fn from_shooters<I>(shooters: I, queue_count: usize) -> Self
    where
        I: IntoIterator<Item = Shooter>,
    {
        let mut deck = Self::new(queue_count.max(1));
        let count = deck.queues.len();
        for (position, shooter) in shooters.into_iter().enumerate() {
            deck.queues[position % count].push_back(shooter);
        }
        deck
    }

    /// Builds a deck whose queues hold exactly the provided shooters.
    #[must_use]
    pub fn from_queues(queues: Vec<Vec<Shooter>>) -> Self {
        Self {
            queues: queues.into_iter().map(VecDeque::from).collect(),
        }
    }

    /// Number of queues, empty or not.
    #[must_use]
    pub fn queue_count(&self) -> usize {
        self.queues.len()
    }

    /// Shooters waiting in queue `index`, front first.
    #[must_use]
    pub fn queue(&self, index: usize) -> Option<&VecDeque<Shooter>> {
        self.queues.get(index)
    }

    /// Shooter at the head of queue `index`.
    #[must_use]
    pub fn front(&self, index: usize) -> Option<&Shooter> {
        self.queues.get(index).and_then(VecDeque::front)
    }

    /// Removes the head of queue `index`.
    pub fn pop(&mut self, index: usize) -> Option<Shooter> {
        self.queues.get_mut(index).and_then(VecDeque::pop_front)
    }

    /// Index of the first queue holding a shooter.
    #[must_use]
    pub fn first_non_empty(&self) -> Option<usize> {
        self.queues.iter().position(|queue| !queue.is_empty())
    }

    /// Reports whether every queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queues.iter().all(VecDeque::is_empty)
    }

    /// Total number of queued shooters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queues.iter().map(VecDeque::len).sum()
    }

    /// Every queued shooter, queue by queue, front first.
    pub fn iter(&self) -> impl Iterator<Item = &Shooter> {
        self.queues.iter().flat_map(|queue| queue.iter())
    }

    /// Iterator over the queues in index order.
    pub fn queues(&self) -> impl Iterator<Item = &VecDeque<Shooter>> {
        self.queues.iter()
    }

    /// Ammo held by the deck keyed by color.
    ///
    /// Totals are widened to `u64` so no combination of shooters can wrap.
    #[must_use]
    pub fn ammo_by_color(&self) -> BTreeMap<Color, u64> {
        let mut totals = BTreeMap::new();
        for shooter in self.iter() {
            *totals.entry(shooter.color()).or_insert(0) += u64::from(shooter.ammo());
        }
        totals
    }

    /// Distinct colors carried by the deck.
    #[must_use]
    pub fn colors(&self) -> BTreeSet<Color> {
        self.iter().map(Shooter::color).collect()
    }
}

/// Fixed-capacity parking area for shooters that finished a lap with ammo.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WaitingSlots {
    slots: Vec<Option<Shooter>>,
}

impl WaitingSlots {
    /// Creates `capacity` empty slots.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
        }
    }

    /// Number of slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Shooter parked in `slot`.
    #[must_use]
    pub fn get(&self, slot: usize) -> Option<&Shooter> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    /// Index of the first free slot.
    #[must_use]
    pub fn first_free(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_none)
    }

    /// Index of the first occupied slot.
    #[must_use]
    pub fn first_occupied(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_some)
    }

    /// Parks the shooter in the first free slot, handing it back when full.
    pub fn park(&mut self, shooter: Shooter) -> Result<usize, Shooter> {
        match self.first_free() {
            Some(slot) => {
                self.slots[slot] = Some(shooter);
                Ok(slot)
            }
            None => Err(shooter),
        }
    }

    /// Removes the shooter parked in `slot`.
    pub fn take(&mut self, slot: usize) -> Option<Shooter> {
        self.slots.get_mut(slot).and_then(Option::take)
    }

    /// Reports whether no slot is occupied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Occupied slots with their indices.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Shooter)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|shooter| (index, shooter)))
    }

    /// Raw slot contents, including empty slots.
    #[must_use]
    pub fn slots(&self) -> &[Option<Shooter>] {
        &self.slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixel_rail_core::ShooterId;

    fn shooter(id: u32, color: Color, ammo: u32) -> Shooter {
        Shooter::new(ShooterId::new(id), color, ammo)
    }

    #[test]
    fn round_robin_deals_in_order() {
        let deck = Deck::from_shooters((0..5).map(|id| shooter(id, Color::Red, 1)), 2);
        let ids: Vec<Vec<u32>> = deck
            .queues()
            .map(|queue| queue.iter().map(|s| s.id().get()).collect())
            .collect();
        assert_eq!(ids, vec![vec![0, 2, 4], vec![1, 3]]);
        assert_eq!(deck.len(), 5);
    }

    #[test]
    fn zero_queue_count_keeps_every_shooter() {
        let deck = Deck::from_shooters([shooter(0, Color::Red, 3)], 0);
        assert_eq!(deck.queue_count(), 1);
        assert_eq!(deck.len(), 1);
    }

    #[test]
    fn pop_drains_front_first_and_tracks_emptiness() {
        let mut deck = Deck::from_queues(vec![
            vec![],
            vec![shooter(7, Color::Blue, 2), shooter(8, Color::Red, 4)],
        ]);
        assert_eq!(deck.first_non_empty(), Some(1));
        assert_eq!(deck.pop(0), None);
        assert_eq!(deck.pop(1).map(|s| s.id()), Some(ShooterId::new(7)));
        assert_eq!(deck.front(1).map(Shooter::ammo), Some(4));
        assert_eq!(deck.pop(1).map(|s| s.id()), Some(ShooterId::new(8)));
        assert!(deck.is_empty());
        assert_eq!(deck.first_non_empty(), None);
        assert_eq!(deck.pop(9), None);
    }

    #[test]
    fn ammo_totals_by_color() {
        let deck = Deck::from_shooters(
            [
                shooter(0, Color::Red, 3),
                shooter(1, Color::Blue, 2),
                shooter(2, Color::Red, 4),
            ],
            2,
        );
        let totals = deck.ammo_by_color();
        assert_eq!(totals.get(&Color::Red), Some(&7));
        assert_eq!(totals.get(&Color::Blue), Some(&2));
        assert_eq!(totals.values().sum::<u64>(), 9);
        assert_eq!(
            deck.colors().into_iter().collect::<Vec<_>>(),
            vec![Color::Red, Color::Blue]
        );
    }

    #[test]
    fn ammo_totals_do_not_wrap() {
        let deck = Deck::from_shooters(
            [shooter(0, Color::Red, u32::MAX), shooter(1, Color::Red, 2)],
            1,
        );
        assert_eq!(
            deck.ammo_by_color().get(&Color::Red),
            Some(&(u64::from(u32::MAX) + 2))
        );
    }

    #[test]
    fn parking_fills_first_free_slot() {
        let mut slots = WaitingSlots::with_capacity(2);
        assert_eq!(slots.park(shooter(1, Color::Red, 1)), Ok(0));
        assert_eq!(slots.park(shooter(2, Color::Red, 1)), Ok(1));
        let rejected = slots.park(shooter(3, Color::Red, 1));
        assert_eq!(rejected.map_err(|s| s.id()), Err(ShooterId::new(3)));

        assert_eq!(slots.take(0).map(|s| s.id()), Some(ShooterId::new(1)));
        assert_eq!(slots.first_free(), Some(0));
        assert_eq!(slots.first_occupied(), Some(1));
        assert_eq!(slots.occupied(), 1);
        assert_eq!(slots.park(shooter(3, Color::Red, 1)), Ok(0));
        assert_eq!(slots.take(5), None);
    }

    #[test]
    fn zero_capacity_never_parks() {
        let mut slots = WaitingSlots::with_capacity(0);
        assert!(slots.park(shooter(1, Color::Red, 1)).is_err());
        assert!(slots.is_empty());
    }
}
