fn main() {
    lalrpop::process_src().expect("failed to process lalrpop grammar");
}
