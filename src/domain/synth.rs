use chrono::{Local, NaiveDateTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::order::{
    Order, OrderStatus, Payment, PaymentMethod, AMOUNT_MAX, AMOUNT_MIN, CUSTOMER_IDS,
};

// ── Injected collaborators ───────────────────────────────────────────────────

pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Wall-clock local time, matching what the warehouse's `order_date` holds.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Supplies `(first_name, last_name)` pairs. No uniqueness is implied.
pub trait NameSource {
    fn name(&mut self) -> (String, String);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FakeitNames;

impl NameSource for FakeitNames {
    fn name(&mut self) -> (String, String) {
        (fakeit::name::first(), fakeit::name::last())
    }
}

// ── Sampling ─────────────────────────────────────────────────────────────────

pub fn synthesize_order<R: Rng + ?Sized, C: Clock + ?Sized>(rng: &mut R, clock: &C) -> Order {
    let user_id = rng.gen_range(CUSTOMER_IDS);
    let status = OrderStatus::ALL[rng.gen_range(0..OrderStatus::ALL.len())];
    Order {
        user_id,
        order_date: clock.now(),
        status,
    }
}

pub fn synthesize_payment<R: Rng + ?Sized>(rng: &mut R) -> Payment {
    let payment_method = PaymentMethod::ALL[rng.gen_range(0..PaymentMethod::ALL.len())];
    let amount = rng.gen_range(AMOUNT_MIN..=AMOUNT_MAX).round() as i32;
    Payment {
        payment_method,
        amount,
    }
}

/// Source of the values written on each iteration.
pub trait Synthesizer {
    fn order(&mut self) -> Order;
    fn payment(&mut self) -> Payment;
    fn customer_name(&mut self) -> (String, String);
}

pub struct RandomSynthesizer<R, C, N> {
    rng: R,
    clock: C,
    names: N,
}

impl<R: Rng, C: Clock, N: NameSource> RandomSynthesizer<R, C, N> {
    pub fn new(rng: R, clock: C, names: N) -> Self {
        Self { rng, clock, names }
    }
}

impl RandomSynthesizer<StdRng, SystemClock, FakeitNames> {
    /// Production synthesizer. Without a seed the generator is drawn from OS
    /// entropy; names come from `fakeit` and are never seeded.
    pub fn with_seed(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(rng, SystemClock, FakeitNames)
    }
}

impl<R: Rng, C: Clock, N: NameSource> Synthesizer for RandomSynthesizer<R, C, N> {
    fn order(&mut self) -> Order {
        synthesize_order(&mut self.rng, &self.clock)
    }

    fn payment(&mut self) -> Payment {
        synthesize_payment(&mut self.rng)
    }

    fn customer_name(&mut self) -> (String, String) {
        self.names.name()
    }
}
