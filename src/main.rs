fn main() {
    dsforge::cli::run();
}
