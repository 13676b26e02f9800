pub mod p950_tender_registry;
