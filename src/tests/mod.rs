mod persistence;
mod trie;
