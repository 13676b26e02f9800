pub mod a101_branch_mapping;
