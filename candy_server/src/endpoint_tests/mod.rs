mod couriers;
mod helpers;
mod mocks;
mod orders;
