fn main() {
    nxbasic::term::main()
}
