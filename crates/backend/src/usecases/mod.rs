pub mod u601_refresh_tenders;
