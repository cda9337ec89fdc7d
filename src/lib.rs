pub mod config;
pub mod distribution;
pub mod error;
pub mod extract_annotation;
pub mod extract_sample_info;
pub mod filter;
pub mod import_vcf;
pub mod info_field;
pub mod normalize;
pub mod query;
pub mod read_vcf_gz;
pub mod search;
pub mod service;
pub mod store;
pub mod variant;
pub mod vcf_header;
pub mod vcf_record;
pub mod write_output;
