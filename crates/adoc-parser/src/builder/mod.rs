//! Tree builder: turns raw grammar fragments into typed nodes.
//!
//! Grammar engines call these constructors from their production actions.
//! Every constructor validates the fragment shape it receives and fails with
//! [`BuildError`](crate::BuildError) rather than building a partial node.

mod blocks;
mod fragments;
mod header;
mod lists;
mod sections;

pub use blocks::{
    new_admonition_paragraph, new_anchor, new_attribute_declaration, new_attribute_reset,
    new_attribute_substitution, new_block_attributes, new_block_image, new_cross_reference,
    new_delimited_block, new_element_attributes, new_external_link, new_file_inclusion,
    new_footnote, new_footnote_reference, new_image_macro, new_inline_image, new_literal_block,
    new_paragraph, new_passthrough, new_quoted_text, new_section, new_user_macro, raw_lines,
};
pub use fragments::{
    StringifyOption, block_nodes, filter_unrelevant_elements, merge, stringify,
};
pub use header::{
    header_attributes, new_document_author, new_document_header, new_document_revision,
    new_yaml_front_matter,
};
pub use lists::{new_list, new_list_item};
pub use sections::nest_sections;
